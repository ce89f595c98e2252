use crate::registry::ViewName;

fn tab_label(view: ViewName) -> &'static str {
    match view {
        ViewName::Dashboard => "Dashboard",
        ViewName::Transactions => "Transactions",
        ViewName::Cards => "Credit cards",
        ViewName::Investments => "Investments",
        ViewName::Goals => "Budget goals",
    }
}

pub fn render_index() -> String {
    let tabs: String = ViewName::ALL
        .into_iter()
        .map(|view| {
            format!(
                r#"<button class="tab" type="button" role="tab" data-tab="{view}">{}</button>"#,
                tab_label(view)
            )
        })
        .collect();
    INDEX_HTML.replace("{{TABS}}", &tabs)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Finance Dashboard</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --bg-app: #09090b;
      --bg-card: #18181b;
      --border: #27272a;
      --text-primary: #fafafa;
      --text-secondary: #a1a1aa;
      --primary: #006fee;
      --success: #17c964;
      --warning: #f5a524;
      --danger: #f31260;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg-app);
      color: var(--text-primary);
      font-family: 'Inter', system-ui, sans-serif;
    }

    nav {
      display: flex;
      gap: 6px;
      padding: 16px 24px;
      border-bottom: 1px solid var(--border);
    }

    .tab {
      border: 0;
      border-radius: 8px;
      padding: 8px 14px;
      background: transparent;
      color: var(--text-secondary);
      cursor: pointer;
    }

    .tab.active {
      background: var(--bg-card);
      color: var(--text-primary);
    }

    main {
      max-width: 1100px;
      margin: 0 auto;
      padding: 24px;
    }

    section[data-view] {
      display: none;
      gap: 18px;
    }

    section[data-view].active {
      display: grid;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 18px;
    }

    .panel {
      background: var(--bg-card);
      border: 1px solid var(--border);
      border-radius: 14px;
      padding: 18px;
    }

    .panel h3 {
      margin: 0 0 12px;
      font-size: 0.85rem;
      font-weight: 500;
      color: var(--text-secondary);
      text-transform: uppercase;
      letter-spacing: 0.06em;
    }

    .big-number {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .text-success { color: var(--success); }
    .text-danger { color: var(--danger); }
    .muted { color: var(--text-secondary); }
    .small { font-size: 0.8rem; }

    form {
      display: grid;
      gap: 8px;
    }

    input, select, button.primary {
      width: 100%;
      padding: 9px 10px;
      border-radius: 8px;
      border: 1px solid var(--border);
      background: var(--bg-app);
      color: var(--text-primary);
    }

    input[type="checkbox"] {
      width: auto;
    }

    button.primary {
      background: var(--primary);
      border: 0;
      cursor: pointer;
      font-weight: 600;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    td {
      padding: 8px 4px;
      border-bottom: 1px solid var(--border);
    }

    .amount { font-weight: 500; }
    .row-actions { text-align: right; }

    .btn-danger-flat {
      border: 0;
      background: transparent;
      color: var(--danger);
      cursor: pointer;
    }

    .row {
      display: flex;
      justify-content: space-between;
      gap: 10px;
      margin-bottom: 6px;
    }

    .goal, .card-limit, .bill {
      padding-bottom: 10px;
      margin-bottom: 10px;
      border-bottom: 1px solid var(--border);
    }

    .goal-controls {
      display: flex;
      align-items: center;
      gap: 6px;
    }

    .goal-pct {
      width: 70px;
      text-align: right;
    }

    .progress-bar-bg {
      height: 8px;
      border-radius: 999px;
      background: var(--border);
      overflow: hidden;
    }

    .progress-bar-fill {
      height: 100%;
      border-radius: 999px;
      transition: width 0.3s ease;
    }

    .chart-box {
      position: relative;
      height: 240px;
    }

    #status:empty {
      display: none;
    }

    #status {
      margin-bottom: 14px;
      color: var(--warning);
    }

    #loading {
      position: fixed;
      inset: 0;
      display: none;
      align-items: center;
      justify-content: center;
      background: rgba(0, 0, 0, 0.55);
      font-weight: 600;
    }

    body.busy #loading {
      display: flex;
    }
  </style>
</head>
<body>
  <nav role="tablist">{{TABS}}</nav>
  <main>
    <div id="status" role="status"></div>

    <section data-view="dashboard">
      <div class="grid">
        <div class="panel"><h3>Income</h3><div id="dash-income" class="big-number">R$ 0,00</div></div>
        <div class="panel"><h3>Fixed expenses</h3><div id="dash-fixed" class="big-number">R$ 0,00</div></div>
        <div class="panel"><h3>Balance</h3><div id="dash-balance" class="big-number">R$ 0,00</div></div>
      </div>
      <div class="grid">
        <div class="panel"><h3>Net worth</h3><div id="dash-net-worth" class="big-number">R$ 0,00</div></div>
        <div class="panel"><h3>Portfolio gain</h3><div id="dash-gain" class="big-number">R$ 0,00</div></div>
        <div class="panel">
          <h3>Dividends this month</h3>
          <div id="dash-dividends" class="big-number">R$ 0,00</div>
          <div id="dash-payment-days" class="muted small"></div>
        </div>
      </div>
      <div class="grid">
        <div class="panel"><h3>Spending</h3><div class="chart-box"><canvas id="chart-spending"></canvas></div></div>
        <div class="panel"><h3>Upcoming bills</h3><div id="dash-bills"></div></div>
      </div>
    </section>

    <section data-view="transactions">
      <div class="grid">
        <form class="panel" data-action="add_income">
          <h3>New income</h3>
          <input name="description" placeholder="Description" />
          <input name="amount" placeholder="Amount" inputmode="decimal" />
          <select name="kind">
            <option value="salary">Salary</option>
            <option value="extra">Extra</option>
          </select>
          <input name="category" placeholder="Category" />
          <button class="primary" type="submit">Add income</button>
        </form>
        <form class="panel" data-action="add_expense">
          <h3>New expense</h3>
          <input name="description" placeholder="Description" />
          <input name="amount" placeholder="Amount" inputmode="decimal" />
          <input name="date" type="date" />
          <select name="goal_category" id="expense-goal-options"></select>
          <label class="muted small"><input name="recurring" type="checkbox" /> Fixed monthly expense</label>
          <button class="primary" type="submit">Add expense</button>
        </form>
      </div>
      <div class="grid">
        <div class="panel"><h3>Incomes</h3><table><tbody id="income-rows"></tbody></table></div>
        <div class="panel"><h3>Expenses</h3><table><tbody id="expense-rows"></tbody></table></div>
      </div>
    </section>

    <section data-view="cards">
      <div class="grid">
        <form class="panel" data-action="register_card">
          <h3>Register card</h3>
          <input name="name" placeholder="Nickname" />
          <input name="limit" placeholder="Credit limit" inputmode="decimal" />
          <input name="closing_day" type="number" min="1" max="31" placeholder="Closing day" />
          <input name="due_day" type="number" min="1" max="31" placeholder="Due day" />
          <button class="primary" type="submit">Register</button>
        </form>
        <form class="panel" data-action="post_card_purchase">
          <h3>Post purchase</h3>
          <select name="card_id" id="card-options"></select>
          <input name="description" placeholder="Description (e.g. STORE 2/10)" />
          <input name="amount" placeholder="Total amount" inputmode="decimal" />
          <input name="installments" type="number" min="1" placeholder="Installments" />
          <input name="date" type="date" />
          <select name="goal_category" id="purchase-goal-options"></select>
          <button class="primary" type="submit">Post</button>
        </form>
      </div>
      <div class="panel"><h3>Limits</h3><div id="card-limits"></div></div>
    </section>

    <section data-view="investments">
      <form class="panel" data-action="add_investment">
        <h3>New position</h3>
        <input name="ticker" placeholder="Ticker" />
        <input name="quantity" type="number" min="1" placeholder="Quantity" />
        <input name="avg_price" placeholder="Average price" inputmode="decimal" />
        <select name="asset_type">
          <option value="STOCK">Stock</option>
          <option value="FII">Real-estate fund (FII)</option>
        </select>
        <button class="primary" type="submit">Save</button>
      </form>
      <div class="panel">
        <h3>Portfolio</h3>
        <table><tbody id="holding-rows"></tbody></table>
      </div>
    </section>

    <section data-view="goals">
      <div class="grid">
        <div class="panel">
          <h3>Allocation</h3>
          <div id="goal-list"></div>
          <div id="goal-total"></div>
        </div>
        <div class="panel"><h3>Distribution</h3><div class="chart-box"><canvas id="chart-goals"></canvas></div></div>
      </div>
      <form class="panel" data-action="create_goal">
        <h3>New goal</h3>
        <input name="name" placeholder="Category name" />
        <input name="pct" placeholder="Percentage" inputmode="decimal" />
        <button class="primary" type="submit">Create</button>
      </form>
    </section>
  </main>
  <div id="loading">Loading...</div>

  <script>
    const charts = {};

    const paintCharts = (instances) => {
      instances.forEach((chart) => {
        const current = charts[chart.canvas];
        if (current && current.instanceId === chart.instance_id) {
          return;
        }
        if (current) {
          current.widget.destroy();
        }
        const canvas = document.getElementById(chart.canvas);
        if (!canvas || typeof Chart === 'undefined') {
          return;
        }
        const widget = new Chart(canvas.getContext('2d'), {
          type: chart.spec.kind,
          data: {
            labels: chart.spec.labels,
            datasets: [{
              data: chart.spec.values,
              backgroundColor: chart.spec.colors,
              borderColor: '#18181b',
              borderWidth: 2
            }]
          },
          options: {
            responsive: true,
            maintainAspectRatio: false,
            plugins: { legend: { position: 'right', labels: { color: '#a1a1aa' } } }
          }
        });
        charts[chart.canvas] = { instanceId: chart.instance_id, widget };
      });
    };

    const paint = (snapshot) => {
      Object.entries(snapshot.regions).forEach(([id, content]) => {
        const el = document.getElementById(id);
        if (!el) {
          return;
        }
        el.innerHTML = content.html;
        if (content.class) {
          el.className = content.class;
        }
      });
      if (snapshot.active_tab) {
        document.querySelectorAll('[data-tab]').forEach((button) => {
          button.classList.toggle('active', button.dataset.tab === snapshot.active_tab);
        });
        document.querySelectorAll('section[data-view]').forEach((section) => {
          section.classList.toggle('active', section.dataset.view === snapshot.active_tab);
        });
      }
      paintCharts(snapshot.charts);
    };

    const loadSurface = async () => {
      const res = await fetch('/api/surface');
      if (!res.ok) {
        throw new Error('Unable to load the dashboard');
      }
      paint(await res.json());
    };

    const openTab = async (view) => {
      const res = await fetch(`/api/tabs/${view}`, { method: 'POST' });
      if (!res.ok) {
        alert(await res.text());
      }
      await loadSurface();
    };

    const run = async (payload, form) => {
      document.body.classList.add('busy');
      try {
        const res = await fetch('/api/actions', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(payload)
        });
        if (!res.ok) {
          alert(await res.text());
          return;
        }
        const outcome = await res.json();
        if (outcome.reset_form && form) {
          form.reset();
        }
        if (outcome.acknowledgment) {
          alert(outcome.acknowledgment);
        }
      } finally {
        await loadSurface().catch(() => {});
        document.body.classList.remove('busy');
      }
    };

    document.querySelectorAll('[data-tab]').forEach((button) => {
      button.addEventListener('click', () => openTab(button.dataset.tab));
    });

    document.querySelectorAll('form[data-action]').forEach((form) => {
      form.addEventListener('submit', (event) => {
        event.preventDefault();
        const fields = {};
        new FormData(form).forEach((value, key) => {
          fields[key] = String(value);
        });
        run({ action: form.dataset.action, fields }, form);
      });
    });

    document.addEventListener('click', (event) => {
      const button = event.target.closest('[data-remove-kind]');
      if (!button) {
        return;
      }
      run({
        action: 'remove_record',
        kind: button.dataset.removeKind,
        id: Number(button.dataset.removeId),
        confirmed: confirm('Remove this record?')
      });
    });

    document.addEventListener('change', (event) => {
      const input = event.target.closest('.goal-pct');
      if (!input) {
        return;
      }
      run({ action: 'update_goal', category: input.dataset.goalCategory, pct: input.value });
    });

    loadSurface().catch((err) => alert(err.message));
  </script>
</body>
</html>
"#;
